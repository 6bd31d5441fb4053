pub mod env {
    pub const API_KEY: &str = "LATENTSENSE_API_KEY";
    pub const PROJECT_ID: &str = "LATENTSENSE_PROJECT_ID";
    pub const BASE_URL: &str = "LATENTSENSE_BASE_URL";
    pub const TIMEOUT_MS: &str = "LATENTSENSE_TIMEOUT_MS";
    pub const LOG_LEVEL: &str = "LATENTSENSE_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod network {
    pub const DEFAULT_BASE_URL: &str = "https://controller.latentsense.com";
    pub const API_KEY_HEADER: &str = "x-api-key";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];
}

pub mod runs {
    pub const COG_NAMES: &[&str] = &[
        "deidentification",
        "relationships",
        "ai_authorship_detection",
        "knowledge_graph",
    ];
    pub const SORT_FIELDS: &[&str] = &["time", "cost"];
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_ROWS_PER_PAGE: u64 = 50;
    pub const DEFAULT_SORT_BY: &str = "time";
    pub const DEFAULT_DESCENDING: bool = true;
}

pub mod uploads {
    pub const FIELD_FILES: &str = "files";
    pub const FIELD_FILES2: &str = "files2";
    pub const FIELD_RELEVANCE_TERM: &str = "relevance_term";
    pub const FIELD_CLAIM_CONCEPTS: &str = "claim_concepts";
    pub const FIELD_CONCEPTS: &str = "concepts";
    pub const FIELD_CUTOFF: &str = "cutoff";
    pub const FIELD_FILES1_NAME: &str = "files1_name";
    pub const FIELD_FILES2_NAME: &str = "files2_name";
    pub const DEFAULT_FILES1_NAME: &str = "set_1";
    pub const DEFAULT_FILES2_NAME: &str = "set_2";
}
