//! Collision and physics collaborator
//!
//! The run-time object layer does not own a full physics solver. It consumes
//! a narrow contract: proxy construction from mesh geometry, point-in-time
//! overlap queries, velocity integration for non-kinematic proxies, and a
//! contact sweep with per-proxy responses. [`PhysicsWorld`] implements that
//! contract with axis-aligned boxes; proxies live in a generation-counted
//! arena so a destroyed proxy's handle goes stale instead of dangling.

pub mod collision_layers;
pub mod shapes;
mod world;

pub use collision_layers::CollisionLayers;
pub use world::{Contact, ContactResponse, PhysicsWorld, ProxyDesc, ProxyKey};
