// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod decoding;
pub mod deserializer;
pub mod logging;
pub mod matcher;
pub mod parser;
pub mod resolver;
pub mod robots;
pub mod transport;
