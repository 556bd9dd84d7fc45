use rand::Rng;

const SHORT_ID_LEN: usize = 5;
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a short human-readable question tag: five uppercase
/// alphanumeric characters. Assigned once per question and immutable
/// thereafter; collisions are acceptable since these are display aids, not
/// keys.
pub fn generate_short_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SHORT_ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
