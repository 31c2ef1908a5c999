//! SQL schema definitions.

/// Complete schema for the v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Construction-time parameters and administration state
-- ============================================================

CREATE TABLE IF NOT EXISTS oracle_admin (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    owner BLOB NOT NULL,
    initialized INTEGER NOT NULL DEFAULT 0,
    expiration_offset_sec INTEGER NOT NULL,
    bound_threshold_percent INTEGER NOT NULL,
    scale_factor TEXT NOT NULL
);

-- ============================================================
-- Asset registry (written once, never updated)
-- ============================================================

CREATE TABLE IF NOT EXISTS assets (
    address BLOB PRIMARY KEY,
    oracle_denom TEXT NOT NULL,
    precision INTEGER NOT NULL
);

-- ============================================================
-- Price cache (one row per submitted direction)
-- ============================================================

CREATE TABLE IF NOT EXISTS price_cache (
    base BLOB NOT NULL REFERENCES assets(address),
    quote BLOB NOT NULL REFERENCES assets(address),
    price TEXT NOT NULL,
    expiration INTEGER NOT NULL,
    PRIMARY KEY (base, quote)
);
"#;
