//! Configuration for BiBip
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Default payload width of a data-file slot (bytes, newline excluded)
pub const DEFAULT_DATA_WIDTH: usize = 500;

/// Default payload width of an index-file slot (bytes, newline excluded)
pub const DEFAULT_INDEX_WIDTH: usize = 50;

/// Main configuration for a dealership store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data and index files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── models.txt / models_index.txt
    ///     ├── cars.txt   / cars_index.txt
    ///     └── sales.txt  / sales_index.txt
    pub data_dir: PathBuf,

    /// Fixed payload width of every data-file record
    pub data_width: usize,

    /// Fixed payload width of every index-file entry
    pub index_width: usize,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// When to fsync after writing a file
    pub sync_strategy: SyncStrategy,
}

/// File sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Leave flushing to the OS page cache
    OsBuffered,

    /// fsync after every file write (safest, slowest)
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./bibip_data"),
            data_width: DEFAULT_DATA_WIDTH,
            index_width: DEFAULT_INDEX_WIDTH,
            sync_strategy: SyncStrategy::OsBuffered,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the data-file slot width
    pub fn data_width(mut self, width: usize) -> Self {
        self.config.data_width = width;
        self
    }

    /// Set the index-file slot width
    pub fn index_width(mut self, width: usize) -> Self {
        self.config.index_width = width;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
