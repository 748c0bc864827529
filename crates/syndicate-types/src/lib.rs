//! Shared type definitions for Syndicate.
//!
//! This crate is the single source of truth for the company record and the
//! rules that turn loosely typed stored JSON into it. Types defined here
//! flow downstream to `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`company`] -- The [`Company`] record and its defaults
//! - [`normalize`] -- Defaulting/coercion of raw records ([`normalize()`])
//! - [`log`] -- Bounded, time-stamped activity log
//! - [`notice`] -- Status-banner notifications ([`Notice`], [`Severity`])
//! - [`ids`] -- Type-safe UUID wrappers

pub mod company;
pub mod ids;
pub mod log;
pub mod normalize;
pub mod notice;

// Re-export all public types at crate root for convenience.
pub use company::{Company, STARTING_LEVEL, STARTING_MONEY, base_company};
pub use ids::TabId;
pub use log::{LOG_CAPACITY, format_entry, push_entry};
pub use normalize::{normalize, normalize_collection};
pub use notice::{Notice, Severity};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the wire types.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::TabId::export_all();
        let _ = crate::company::Company::export_all();
        let _ = crate::notice::Severity::export_all();
        let _ = crate::notice::Notice::export_all();
    }
}
