use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, fixed_array};
use crate::encode::ToArgs;
use crate::error::Error;

/// A longitude/latitude pair as returned by `GEOPOS`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoPos {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPos {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl FromReply for GeoPos {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = fixed_array(reply, 2, "a geo position")?;
        Ok(GeoPos {
            longitude: f64::from_reply(&items[0], protocol)?,
            latitude: f64::from_reply(&items[1], protocol)?,
        })
    }
}

impl ToArgs for GeoPos {
    fn arg_count(&self) -> usize {
        2
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        self.longitude.write_args(out);
        self.latitude.write_args(out);
    }
}
