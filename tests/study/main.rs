#![allow(clippy::cast_precision_loss)]

mod shared_storage;
mod workflow;
