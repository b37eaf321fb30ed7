#![no_main]

use idlgo::backend::{GeneratorOptions, GoGenerator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Only documents the loader accepts reach the generator
        if let Ok(schema) = idlgo_ast::load_str(s) {
            let options = GeneratorOptions::default();
            let _ = GoGenerator::new(&schema, &options).generate_all();
        }
    }
});
