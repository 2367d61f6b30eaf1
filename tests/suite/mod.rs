mod binary;
mod config_files;
mod pipelines;
mod write_coalescing;
