use crate::core::{BarcodeReader, DecodedBarcode};
use image::ImageFormat;

/// Symbology names printed by decoder tools in `TYPE:payload` form (zbarimg style).
const KNOWN_SYMBOLOGIES: [&str; 12] = [
    "EAN-8", "EAN-13", "UPC-A", "UPC-E", "ISBN-10", "ISBN-13", "I2/5", "CODE-39", "CODE-93",
    "CODE-128", "DataBar", "QR-Code",
];

/// Reads the text a keyboard-wedge scanner or a decoder tool writes: one barcode per line.
///
/// Image files and other binary input (anything with a NUL byte) yield no barcodes at all.
/// Lines that are not valid UTF-8, are empty once whitespace, control characters and a
/// byte-order mark are stripped, or still carry control characters, are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScannerInputReader;

impl ScannerInputReader {
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeReader for ScannerInputReader {
    fn decode(&self, input: &[u8]) -> Vec<DecodedBarcode> {
        if let Some(format) = sniff_image(input) {
            tracing::warn!(
                "Input is a {:?} image, not scanner text; decode it with a barcode tool first",
                format
            );
            return Vec::new();
        }
        if input.contains(&0) {
            tracing::warn!("Input is binary, not scanner text");
            return Vec::new();
        }

        input
            .split(|b| *b == b'\n')
            .filter_map(|line| match std::str::from_utf8(line) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::debug!("Skipping scanner line that is not UTF-8: {}", e);
                    None
                }
            })
            .filter_map(parse_line)
            .collect()
    }
}

/// Magic bytes only count for input that is not UTF-8: "BM..." and "P1..." are valid payloads.
fn sniff_image(input: &[u8]) -> Option<ImageFormat> {
    if std::str::from_utf8(input).is_ok() {
        return None;
    }
    image::guess_format(input).ok()
}

fn parse_line(line: &str) -> Option<DecodedBarcode> {
    let line = line.trim_matches(|c: char| c.is_whitespace() || c.is_control() || c == '\u{FEFF}');
    if line.is_empty() {
        return None;
    }
    if line.chars().any(|c| c.is_control() && c != '\t') {
        tracing::debug!("Skipping scanner line with control characters");
        return None;
    }

    if let Some((prefix, payload)) = line.split_once(':') {
        if let Some(symbology) = KNOWN_SYMBOLOGIES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(prefix))
        {
            let payload = payload.trim();
            if payload.is_empty() {
                return None;
            }
            return Some(DecodedBarcode {
                payload: payload.to_string(),
                symbology: symbology.to_string(),
            });
        }
    }

    Some(DecodedBarcode {
        payload: line.to_string(),
        symbology: infer_symbology(line).to_string(),
    })
}

/// Retail codes are recognised by length and check digit; anything else is reported as CODE-128.
pub fn infer_symbology(payload: &str) -> &'static str {
    if !payload.chars().all(|c| c.is_ascii_digit()) || !has_valid_check_digit(payload) {
        return "CODE-128";
    }
    match payload.len() {
        8 => "EAN-8",
        12 => "UPC-A",
        13 => "EAN-13",
        _ => "CODE-128",
    }
}

/// GS1 mod-10 check: weights 3,1,3,... from the digit left of the check digit.
fn has_valid_check_digit(digits: &str) -> bool {
    let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    let Some((&check, body)) = values.split_last() else {
        return false;
    };

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check
}
