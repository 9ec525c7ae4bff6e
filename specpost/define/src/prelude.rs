//! Convenient re-exports for working with specpost definitions.
//!
//! ```
//! use specpost_define::prelude::*;
//!
//! let profile = Profile::default();
//! assert_eq!(profile.auth_variable, "authToken");
//! ```

pub use crate::collection::{
    Collection, CollectionItem, CollectionVariable, Header, ItemGroup, PathBinding, QueryParam, RequestBody,
    RequestUrl, ResponseExample,
};
pub use crate::dependency::{DependencyEntry, DependencyTable};
pub use crate::environment::{Environment, EnvironmentValue};
pub use crate::profile::{Profile, SynthesisStrategy};
pub use crate::routing::{ResourceSegment, Route, RoutingTable};
pub use crate::script::{ExtractSource, Script, Statement, StatusExpectation};
pub use crate::types::{EndpointKey, HttpMethod, ParameterLocation};
pub use crate::workflow::{BodyOverride, WorkflowConfig, WorkflowStep};
