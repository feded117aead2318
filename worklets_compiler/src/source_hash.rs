use tiny_keccak::{Hasher, Keccak};

/// Stable payload id: keccak-256 over the file, the worklet's ordinal in it
/// and its emitted code, truncated to 64 bits and hex encoded.
pub fn worklet_hash(file: &str, ordinal: u32, code: &str) -> String {
  let mut k = Keccak::v256();
  k.update(file.as_bytes());
  k.update(&[0]);
  k.update(ordinal.to_string().as_bytes());
  k.update(&[0]);
  k.update(code.as_bytes());

  let mut output = [0u8; 32];
  k.finalize(&mut output);

  output[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_is_stable_and_input_sensitive() {
    let a = worklet_hash("a.js", 1, "function () {}");
    assert_eq!(a, worklet_hash("a.js", 1, "function () {}"));
    assert_eq!(a.len(), 16);
    assert_ne!(a, worklet_hash("b.js", 1, "function () {}"));
    assert_ne!(a, worklet_hash("a.js", 2, "function () {}"));
    assert_ne!(a, worklet_hash("a.js", 1, "function () { }"));
  }
}
