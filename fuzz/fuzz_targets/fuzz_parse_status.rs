#![no_main]
use libfuzzer_sys::fuzz_target;
use maxbridge::gateway::DeviceAddress;
use maxbridge::parser;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    // Gateway bodies of every kind: status JSON, cube list, duty text
    if let Ok(doc) = parser::parse_document(body)
        && let Ok(address) = DeviceAddress::new(0x12_34_56)
        && let Ok(Some(record)) = parser::locate_device(&doc, address)
    {
        let _ = record.kind();
        let _ = record.mode();
        let _ = record.number(parser::fields::TEMPERATURE);
    }
    let _ = parser::parse_cube_snapshot(body);
    let _ = parser::parse_cube_list(body);
    let _ = parser::duty_percentage(body);
});
