#![no_main]

use classlens::manifest::{Manifest, parse_arg};
use classlens::TypeInspector;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz manifest resolution
        if let Ok(registry) = Manifest::from_json(s).and_then(Manifest::into_registry) {
            // If it resolves, construct every type from a fixed argument list
            let inspector = TypeInspector::new();
            for ty in registry.iter() {
                let _ = inspector.create_instance(ty, vec![parse_arg("1"), parse_arg("x")]);
                let _ = inspector.all_method_names(ty);
            }
        }
    }
});
