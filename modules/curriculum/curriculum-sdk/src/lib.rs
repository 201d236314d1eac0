//! Curriculum SDK
//!
//! This crate provides the public API for the `curriculum` module:
//! - `CurriculumClientV1` trait
//! - Model types for users, taxonomy nodes, questions, tests and credits
//! - `Role` and `Capability`
//! - Error type (`CurriculumError`)
//!
//! ## Usage
//!
//! ```ignore
//! use curriculum_sdk::{CurriculumClientV1, NewTaxonomy};
//!
//! let node = client
//!     .create_taxonomy(NewTaxonomy {
//!         id: None,
//!         subject_code: "MAT".into(),
//!         grade_code: "5".into(),
//!         theme_code: None,
//!         unit_code: Some("U1".into()),
//!         outcome_code: "O3".into(),
//!     })
//!     .await?;
//! assert_eq!(node.to_string(), "MAT.5.U1.O3");
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod errors;
pub mod models;
pub mod role;

pub use client::CurriculumClientV1;
pub use errors::CurriculumError;
pub use models::{
    CreditTransaction, Group, ListQuery, NewGroup, NewPermission, NewQuestion, NewTaxonomy,
    NewTest, NewUser, Page, Permission, Question, QuestionPatch, Taxonomy, TaxonomyFilter,
    TaxonomyPatch, Test, User, UserCredit, UserPatch,
};
pub use role::{Capability, Role, UnknownRoleError};
