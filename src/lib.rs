// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod db;
pub mod engine;
pub mod error;
pub mod identity;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod taxonomy;
pub mod utils;
pub mod validator;
