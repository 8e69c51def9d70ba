use super::{parse_query_string, to_query_string, ParamMap};

/// Where encoded builder state lives between sessions
pub trait StateStore {
    fn load(&self) -> ParamMap;

    /// Replace the stored parameters; the last write wins
    fn store(&mut self, params: &ParamMap);
}

/// In-memory store, counting writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    params: ParamMap,
    writes: usize,
}

impl MemoryStateStore {
    pub fn new(params: ParamMap) -> Self {
        Self { params, writes: 0 }
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> ParamMap {
        self.params.clone()
    }

    fn store(&mut self, params: &ParamMap) {
        self.params = params.clone();
        self.writes += 1;
    }
}

/// Store backed by a URL query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStringStore {
    query: String,
}

impl QueryStringStore {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl StateStore for QueryStringStore {
    fn load(&self) -> ParamMap {
        parse_query_string(&self.query)
    }

    fn store(&mut self, params: &ParamMap) {
        self.query = to_query_string(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_last_write_wins() {
        let mut store = MemoryStateStore::default();
        let mut first = ParamMap::new();
        first.insert("strategy".to_string(), "direct".to_string());
        let mut second = ParamMap::new();
        second.insert("strategy".to_string(), "clinical".to_string());

        store.store(&first);
        store.store(&second);
        assert_eq!(store.load(), second);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_query_string_store_round_trip() {
        let mut store = QueryStringStore::new("?strategy=direct&filters=English+Only");
        let params = store.load();
        assert_eq!(params.get("filters").map(String::as_str), Some("English Only"));

        store.store(&params);
        assert_eq!(store.query(), "filters=English+Only&strategy=direct");
    }
}
