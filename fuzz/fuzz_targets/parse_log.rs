use honggfuzz::fuzz;
use oracle_progress::{LogParser, ProgressError};

fn main() {
    let parser = LogParser::new("logp").expect("static label");
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(text) = std::str::from_utf8(data) {
                if let Ok(map) = parser.parse_str(text) {
                    match map.expand() {
                        Ok(series) => {
                            assert_eq!(series.len() as u64, map.max_oracle_calls().unwrap_or(0))
                        }
                        Err(ProgressError::InvalidPoint(_)) => {}
                        Err(e) => panic!("unexpected expand error: {e}"),
                    }
                }
            }
        });
    }
}
