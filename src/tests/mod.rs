pub mod common;

mod supplier_logging;
