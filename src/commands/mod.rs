// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod user;
pub mod accounts;
pub mod assets;
pub mod categories;
pub mod bills;
pub mod reports;
pub mod exporter;
pub mod doctor;
