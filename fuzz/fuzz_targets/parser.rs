#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input length; huge inputs burn time without reaching new parser states.
    if data.len() > 64 * 1024 {
        return;
    }
    let src = String::from_utf8_lossy(data);
    if let Ok(program) = rpl::parse_source(&src) {
        // Printed output must stay parseable.
        let printed = rpl::print_program(&program);
        let _ = rpl::parse_source(&printed);
    }
});
