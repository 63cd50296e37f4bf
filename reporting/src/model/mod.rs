// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value objects served by the reporting API
//!
//! All types serialize to camelCase JSON and round-trip through the cache.

pub mod contact;
pub mod statistics;

pub use contact::{ConsumerGroup, Contact, ContactReferencedEntry};
pub use statistics::{
    PropertyCharacteristic, PropertyMetadata, PropertyUsage, StatisticItem, StatisticsResult,
    VersionCountSnapshot, WordCountSnapshot,
};
