// src/config/mod.rs
pub mod sources;

pub use sources::{
    AggregatorConfig, CredentialCheck, CredentialPolicy, MovieConfig, NewsConfig, SocialConfig,
    SourcesConfig,
};
