mod dataset_tests;
mod utils;
