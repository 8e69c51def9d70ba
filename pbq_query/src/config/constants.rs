pub mod compile_time {
    pub mod qualifiers {
        /// Qualifier written for controlled-vocabulary terms created by mutators
        pub const CANONICAL_MESH_QUALIFIER: &str = "[Mesh]";

        /// Qualifier written for free-text terms created by mutators
        pub const CANONICAL_TEXT_QUALIFIER: &str = "[tiab]";

        /// Qualifiers (lowercase, without brackets) searching the controlled vocabulary
        pub const MESH_QUALIFIERS: &[&str] = &[
            "mesh",
            "mh",
            "mesh terms",
            "mesh:noexp",
            "mh:noexp",
            "majr",
            "majr:noexp",
            "mesh major topic",
            "sh",
            "subheading",
        ];

        /// Qualifiers searching free text (title, abstract, text words)
        pub const TEXT_QUALIFIERS: &[&str] = &[
            "tiab",
            "ti",
            "ab",
            "title",
            "abstract",
            "title/abstract",
            "tw",
            "text word",
            "all",
            "all fields",
        ];

        /// Qualifiers restricting by author, language, date, publication type or subset
        pub const FILTER_QUALIFIERS: &[&str] = &[
            "au",
            "author",
            "1au",
            "lastau",
            "la",
            "language",
            "dp",
            "pdat",
            "edat",
            "crdt",
            "publication date",
            "pt",
            "publication type",
            "sb",
            "subset",
            "filter",
            "ta",
            "journal",
        ];
    }

    pub mod mutation {
        use crate::tokens::BooleanOperator;

        /// Operator inserted between existing content and a newly added term
        pub const DEFAULT_JOIN_OPERATOR: BooleanOperator = BooleanOperator::Or;
    }

    pub mod codec {
        /// Parameter holding the active strategy key
        pub const STRATEGY_PARAM: &str = "strategy";

        /// Parameter holding the applied filter labels
        pub const FILTERS_PARAM: &str = "filters";

        /// Separator between filter labels in the encoded filter list
        pub const FILTER_DELIMITER: char = ',';
    }

    pub mod logging {
        /// Events retained by `MemoryLogger` before the oldest are dropped
        pub const LOG_BUFFER_SIZE: usize = 10_000;
    }
}
