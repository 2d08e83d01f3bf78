//! Resource mutation facade
//!
//! [`ResourceClient`] covers one resource type at subscription, resource
//! group and account scope. [`ChildClient`] covers a named child collection
//! below each account (firewall rules, linked storage accounts, ...).
//!
//! Success sets per operation:
//!
//! | Operation                | Method | Success       |
//! |--------------------------|--------|---------------|
//! | list / get / name check  | GET    | 200           |
//! | begin_create             | PUT    | 200, 201      |
//! | begin_update             | PATCH  | 200, 201, 202 |
//! | begin_delete             | DELETE | 200, 202, 204 |
//! | child create / add       | PUT    | 200           |
//! | child update             | PATCH  | 200           |
//! | child remove             | DELETE | 200, 204      |

mod child;
mod resource;

pub use child::ChildClient;
pub use resource::ResourceClient;
