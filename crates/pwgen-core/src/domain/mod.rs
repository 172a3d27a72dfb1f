//! Domain logic for pwgen.
//!
//! This module contains pure business rules with no I/O:
//!
//! - **`password`** – the four password classes, their alphabets, and the
//!   random generators.
//! - **`validation`** – checks applied to an incoming request before anything
//!   is generated.
//!
//! Both are stateless, so the server can call them from any session (or any
//! task, when sessions run concurrently) without coordination.

pub mod password;
pub mod validation;
