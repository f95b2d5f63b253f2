//! Full-text search replies (`FT.SEARCH`).

use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, fixed_array};
use crate::encode::ToArgs;
use crate::error::Error;

/// One search hit: the document id and its returned fields.
///
/// `fields[i]` names `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDocument {
    pub id: String,
    pub fields: Vec<String>,
    pub values: Vec<String>,
}

impl SearchDocument {
    fn with_fields(id: String, body: Option<&Value>, protocol: Protocol) -> Result<Self, Error> {
        let mut document = SearchDocument {
            id,
            ..Default::default()
        };
        if let Some(body) = body {
            for (field, value) in Vec::<(String, String)>::from_reply(body, protocol)? {
                document.fields.push(field);
                document.values.push(value);
            }
        }
        Ok(document)
    }

    /// The value of the field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        let index = self.fields.iter().position(|field| field == name)?;
        self.values.get(index).map(String::as_str)
    }
}

impl FromReply for SearchDocument {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = fixed_array(reply, 2, "a search document")?;
        let id = String::from_reply(&items[0], protocol)?;
        Self::with_fields(id, Some(&items[1]), protocol)
    }
}

impl ToArgs for SearchDocument {
    fn arg_count(&self) -> usize {
        1 + self.fields.len() + self.values.len()
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::copy_from_slice(self.id.as_bytes()));
        let rows = self.fields.len().max(self.values.len());
        for i in 0..rows {
            if let Some(field) = self.fields.get(i) {
                out.push(Bytes::copy_from_slice(field.as_bytes()));
            }
            if let Some(value) = self.values.get(i) {
                out.push(Bytes::copy_from_slice(value.as_bytes()));
            }
        }
    }
}

/// A page of search hits: `[total, id1, [f, v, ...], id2, [f, v, ...], ...]`.
///
/// With `NOCONTENT` the reply is `[total, id1, id2, ...]` and documents carry
/// no fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Total number of matches, which may exceed `documents.len()`.
    pub total: i64,
    pub documents: Vec<SearchDocument>,
}

impl FromReply for SearchResults {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = reply
            .as_array()
            .ok_or_else(|| Error::mismatch("ARRAY", reply))?;
        let (total, rest) = items
            .split_first()
            .ok_or_else(|| Error::protocol("empty search reply"))?;

        let mut documents = Vec::new();
        let mut rest = rest.iter().peekable();
        while let Some(id) = rest.next() {
            let id = String::from_reply(id, protocol)?;
            let body = rest.next_if(|next| next.is_aggregate());
            documents.push(SearchDocument::with_fields(id, body, protocol)?);
        }

        Ok(SearchResults {
            total: i64::from_reply(total, protocol)?,
            documents,
        })
    }
}
