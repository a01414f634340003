// ============================================================
// CSV CODEC
// ============================================================
// Decode uploaded port snapshots, encode the current view for download

use crate::domain::error::{AppError, Result};
use crate::domain::port_record::PortRecord;

/// Header emitted on export; the imported header row is discarded without
/// being checked against it.
pub const CSV_HEADER: &str = "Protocol,State,Local Address,Port,PID,Process,Docker Container";

/// Parse a CSV text blob into port records.
///
/// Blank lines are dropped, the first remaining line is treated as the header,
/// and each data line is split by [`split_csv_line`]. Positional tokens map to
/// the seven record fields; a missing or empty token takes the field's default.
/// Rows whose process resolves to `"unknown"` are filtered out, so a row that
/// carries the value explicitly is dropped together with rows that merely
/// lacked the column.
pub fn decode(text: &str) -> Result<Vec<PortRecord>> {
    let lines: Vec<&str> = text.split('\n').filter(|line| !line.trim().is_empty()).collect();

    if lines.is_empty() {
        return Err(AppError::DecodeError("missing header row".to_string()));
    }

    let records = lines[1..]
        .iter()
        .map(|line| record_from_tokens(split_csv_line(line)))
        .filter(|record| !record.is_unknown_process())
        .collect();

    Ok(records)
}

/// Serialize records in table order.
///
/// Values are joined with commas as-is: no quoting, no escaping. A field that
/// itself contains a comma will corrupt its row on re-import. That mirrors the
/// export the dashboard always produced and is accepted as a known limitation.
pub fn encode(records: &[PortRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for record in records {
        lines.push(
            [
                record.protocol.as_str(),
                record.state.as_str(),
                record.local_address.as_str(),
                record.port.as_str(),
                record.pid.as_str(),
                record.process.as_str(),
                record.docker_container.as_str(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Quote-aware comma split.
///
/// A `"` flips the in-quotes flag and is never emitted, so quotes delimit but
/// cannot be embedded (`""` yields nothing, not a literal quote). Commas split
/// only outside quotes. Tokens are trimmed after extraction.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == ',' && !in_quotes {
            tokens.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    tokens.push(current.trim().to_string());
    tokens
}

fn record_from_tokens(tokens: Vec<String>) -> PortRecord {
    let field = |idx: usize, default: &str| -> String {
        match tokens.get(idx) {
            Some(token) if !token.is_empty() => token.clone(),
            _ => default.to_string(),
        }
    };

    PortRecord {
        protocol: field(0, PortRecord::DEFAULT_PROTOCOL),
        state: field(1, PortRecord::DEFAULT_STATE),
        local_address: field(2, PortRecord::DEFAULT_LOCAL_ADDRESS),
        port: field(3, PortRecord::DEFAULT_PORT),
        pid: field(4, PortRecord::DEFAULT_PID),
        process: field(5, PortRecord::DEFAULT_PROCESS),
        docker_container: field(6, PortRecord::DEFAULT_DOCKER_CONTAINER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(process: &str, port: &str) -> PortRecord {
        PortRecord {
            protocol: "TCP".to_string(),
            state: "LISTENING".to_string(),
            local_address: "127.0.0.1".to_string(),
            port: port.to_string(),
            pid: "123".to_string(),
            process: process.to_string(),
            docker_container: String::new(),
        }
    }

    #[test]
    fn decodes_simple_rows_in_input_order() {
        let text = "Protocol,State,Local Address,Port,PID,Process,Docker Container\n\
                    TCP,LISTENING,127.0.0.1,8080,123,nginx,web1\n\
                    UDP,UNCONN,0.0.0.0,53,99,dnsmasq,";
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].process, "nginx");
        assert_eq!(records[0].docker_container, "web1");
        assert_eq!(records[1].protocol, "UDP");
        assert_eq!(records[1].docker_container, "");
    }

    #[test]
    fn blank_and_trailing_lines_are_ignored() {
        let text = "header\n\nTCP,LISTENING,127.0.0.1,80,1,nginx,\n   \n";
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].port, "80");
    }

    #[test]
    fn empty_input_is_a_decode_error() {
        assert!(matches!(decode(""), Err(AppError::DecodeError(_))));
        assert!(matches!(decode("  \n \n"), Err(AppError::DecodeError(_))));
    }

    #[test]
    fn header_only_input_yields_no_records() {
        let records = decode("Protocol,State,Local Address,Port,PID,Process,Docker Container").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn quoted_field_keeps_comma_and_loses_quotes() {
        let text = "header\nTCP,LISTENING,\"10.0.0.1,v6\",8080,123,nginx,web1";
        let records = decode(text).unwrap();
        assert_eq!(records[0].local_address, "10.0.0.1,v6");
    }

    #[test]
    fn doubled_quotes_do_not_produce_a_literal_quote() {
        let text = "header\nTCP,LISTENING,\"\"10.0.0.1,8080,123,nginx,";
        let records = decode(text).unwrap();
        // Both quote characters toggle and vanish; the comma splits normally.
        assert_eq!(records[0].local_address, "10.0.0.1");
        assert_eq!(records[0].port, "8080");
    }

    #[test]
    fn short_row_falls_back_to_defaults_and_is_dropped_as_unknown() {
        // `TCP,LISTENING` resolves process to the "unknown" default, and rows
        // with an unknown process never survive import.
        let records = decode("header\nTCP,LISTENING").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn short_row_with_process_survives_with_defaults() {
        let records = decode("header\nUDP,UNCONN,10.1.2.3,53,77,dnsmasq").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].docker_container, PortRecord::DEFAULT_DOCKER_CONTAINER);
        assert_eq!(records[0].pid, "77");
    }

    #[test]
    fn empty_tokens_take_defaults_like_missing_ones() {
        let records = decode("header\n,,,,,nginx,").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].protocol, PortRecord::DEFAULT_PROTOCOL);
        assert_eq!(records[0].state, PortRecord::DEFAULT_STATE);
        assert_eq!(records[0].local_address, PortRecord::DEFAULT_LOCAL_ADDRESS);
        assert_eq!(records[0].port, PortRecord::DEFAULT_PORT);
        assert_eq!(records[0].pid, PortRecord::DEFAULT_PID);
    }

    #[test]
    fn explicit_unknown_process_is_dropped() {
        let text = "header\nTCP,LISTENING,127.0.0.1,80,1,unknown,\nTCP,LISTENING,127.0.0.1,81,2,nginx,";
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].process, "nginx");
    }

    #[test]
    fn extra_tokens_beyond_the_seventh_are_ignored() {
        let records = decode("header\nTCP,LISTENING,127.0.0.1,80,1,nginx,web1,extra,junk").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].docker_container, "web1");
    }

    #[test]
    fn encode_emits_header_and_unquoted_rows() {
        let out = encode(&[record("nginx", "8080")]);
        assert_eq!(
            out,
            format!("{}\nTCP,LISTENING,127.0.0.1,8080,123,nginx,", CSV_HEADER)
        );
    }

    #[test]
    fn encode_of_empty_view_is_just_the_header() {
        assert_eq!(encode(&[]), CSV_HEADER);
    }

    #[test]
    fn delimiter_free_values_round_trip() {
        let original = vec![record("nginx", "8080"), record("postgres", "5432")];
        let decoded = decode(&encode(&original)).unwrap();
        assert_eq!(decoded, original);

        // decode(encode(decode(text))) == decode(text)
        let text = encode(&original);
        let once = decode(&text).unwrap();
        let twice = decode(&encode(&once)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn encode_does_not_escape_commas() {
        // Known limitation: a comma inside a value corrupts the row on the
        // way back in.
        let mut corrupt = record("nginx", "8080");
        corrupt.local_address = "10.0.0.1,v6".to_string();
        let decoded = decode(&encode(&[corrupt])).unwrap();
        assert_eq!(decoded[0].local_address, "10.0.0.1");
        assert_eq!(decoded[0].port, "v6");
    }
}
