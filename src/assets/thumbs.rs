use std::collections::HashMap;

/// Session-scoped thumbnail bytes, keyed by the `session:<key>` reference a
/// stream's thumbnail field carries. The editor owns one of these per open
/// document and releases entries explicitly when a thumbnail is replaced or
/// its stream goes away; dropping the store releases everything.
#[derive(Debug, Default)]
pub struct SessionThumbs {
    entries: HashMap<String, SessionThumb>,
    next_key: u64,
}

#[derive(Clone, Debug)]
pub struct SessionThumb {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub const SESSION_PREFIX: &str = "session:";

impl SessionThumbs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers uploaded bytes and returns the `session:` reference to store
    /// in the stream's thumbnail field.
    pub fn insert(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> String {
        self.next_key += 1;
        let key = format!("thumb-{}", self.next_key);
        self.entries.insert(
            key.clone(),
            SessionThumb {
                file_name: file_name.into(),
                bytes,
            },
        );
        format!("{SESSION_PREFIX}{key}")
    }

    pub fn get(&self, key: &str) -> Option<&SessionThumb> {
        self.entries.get(key)
    }

    /// Releases the entry behind a thumbnail reference, if it is a session
    /// reference that is still live. Non-session references are ignored.
    pub fn release_ref(&mut self, thumbnail: &str) {
        if let Some(key) = thumbnail.strip_prefix(SESSION_PREFIX) {
            self.entries.remove(key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
