//! Short human-readable identifiers assigned to records on creation.
//!
//! - categories get three 2-character segments joined by `-` (e.g. `a3-0f-9c`),
//! - products get two 3-character segments joined by `/`, truncated to
//!   the first six characters (e.g. `4be/a1`).
//!
//! Identifiers are random; callers are expected to retry on collision.

use rand::Rng;


/// Identifiers are made of lowercase hexadecimal digits.
const IDENTIFIER_ALPHABET: &[u8] = b"0123456789abcdef";

const CATEGORY_SEGMENT_COUNT: usize = 3;
const CATEGORY_SEGMENT_SIZE: usize = 2;
const CATEGORY_DELIMITER: char = '-';

const PRODUCT_SEGMENT_COUNT: usize = 2;
const PRODUCT_SEGMENT_SIZE: usize = 3;
const PRODUCT_DELIMITER: char = '/';
const PRODUCT_IDENTIFIER_LENGTH: usize = 6;


fn generate_segmented_identifier(
    segment_count: usize,
    segment_size: usize,
    delimiter: char,
) -> String {
    let mut random_generator = rand::thread_rng();

    let mut identifier = String::with_capacity(segment_count * (segment_size + 1));
    for segment_index in 0..segment_count {
        if segment_index > 0 {
            identifier.push(delimiter);
        }

        identifier.extend((0..segment_size).map(|_| {
            let alphabet_index = random_generator.gen_range(0..IDENTIFIER_ALPHABET.len());
            char::from(IDENTIFIER_ALPHABET[alphabet_index])
        }));
    }

    identifier
}


pub fn generate_category_identifier() -> String {
    generate_segmented_identifier(
        CATEGORY_SEGMENT_COUNT,
        CATEGORY_SEGMENT_SIZE,
        CATEGORY_DELIMITER,
    )
}

pub fn generate_product_identifier() -> String {
    let mut identifier = generate_segmented_identifier(
        PRODUCT_SEGMENT_COUNT,
        PRODUCT_SEGMENT_SIZE,
        PRODUCT_DELIMITER,
    );
    identifier.truncate(PRODUCT_IDENTIFIER_LENGTH);

    identifier
}


fn is_segment(segment: &str, size: usize) -> bool {
    segment.len() == size
        && segment
            .chars()
            .all(|character| character.is_ascii_hexdigit() && !character.is_ascii_uppercase())
}

pub fn is_category_identifier(identifier: &str) -> bool {
    let segments = identifier.split(CATEGORY_DELIMITER).collect::<Vec<_>>();

    segments.len() == CATEGORY_SEGMENT_COUNT
        && segments
            .iter()
            .all(|segment| is_segment(segment, CATEGORY_SEGMENT_SIZE))
}

pub fn is_product_identifier(identifier: &str) -> bool {
    let Some((first, second)) = identifier.split_once(PRODUCT_DELIMITER) else {
        return false;
    };

    identifier.len() == PRODUCT_IDENTIFIER_LENGTH
        && is_segment(first, PRODUCT_SEGMENT_SIZE)
        && is_segment(second, PRODUCT_IDENTIFIER_LENGTH - PRODUCT_SEGMENT_SIZE - 1)
}
