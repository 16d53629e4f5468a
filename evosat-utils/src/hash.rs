/// Derives a 32 byte seed from an arbitrary string, so that a run can be
/// reproduced from a human readable seed.
pub fn u8s_from_str(input: &str) -> [u8; 32] {
    blake3::hash(input.as_bytes()).into()
}
