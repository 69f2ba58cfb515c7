pub mod no_cache;
