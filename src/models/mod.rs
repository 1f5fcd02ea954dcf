// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod compression;
pub mod robots;
pub mod settings;
pub mod sitemap;
