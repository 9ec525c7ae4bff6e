//! Specpost Definition Library
//!
//! Plain data types shared by the `specpost-gen` compiler stages. Nothing in
//! this crate reads files or walks interface descriptions; it only describes
//! what the compiler produces and the tables that drive it.
//!
//! ## Core Types
//!
//! ### Compiled output
//!
//! - [`Collection`] - Ordered item groups plus collection variables
//! - [`CollectionItem`] - One runnable request with bound URL, body and scripts
//! - [`RequestUrl`] - Templated URL using `{{variable}}` placeholders
//! - [`Script`] / [`Statement`] - Ordered pre-request and test statements
//! - [`Environment`] - Flat named-variable template
//!
//! ### Compiler tables
//!
//! - [`DependencyTable`] - `METHOD PATH` to provides/requires variables
//! - [`RoutingTable`] - Path segment to base-URL variable
//! - [`WorkflowConfig`] - Ordered end-to-end workflow steps
//! - [`Profile`] - Everything above bundled, with a built-in ledger default
//!
//! ## Examples
//!
//! ```
//! use specpost_define::{DependencyTable, DependencyEntry};
//!
//! let table = DependencyTable::new()
//!     .with("POST /v1/organizations", DependencyEntry::new(["organizationId"], Vec::<String>::new()))
//!     .with("POST /v1/organizations/{organization_id}/ledgers", DependencyEntry::new(["ledgerId"], ["organizationId"]));
//!
//! assert_eq!(table.collect_variables().len(), 2);
//! ```

pub mod collection;
pub mod dependency;
pub mod environment;
pub mod ledger;
pub mod prelude;
pub mod profile;
pub mod routing;
pub mod script;
pub mod types;
pub mod workflow;

// Re-export main types at crate root
pub use collection::{
    Collection, CollectionItem, CollectionVariable, DEFAULT_GROUP, Header, ItemGroup, PathBinding, QueryParam,
    RequestBody, RequestUrl, ResponseExample,
};
pub use dependency::{DependencyEntry, DependencyTable};
pub use environment::{Environment, EnvironmentValue};
pub use profile::{Profile, SynthesisStrategy, TextBody};
pub use routing::{ResourceSegment, Route, RoutingTable};
pub use script::{ExtractSource, Script, Statement, StatusExpectation};
pub use types::{EndpointKey, EndpointKeyError, HttpMethod, ParameterLocation};
pub use workflow::{BodyOverride, WorkflowConfig, WorkflowStep};
