use rand::Rng;

const ID_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// random base-36 string, not unique on its own
fn random_base36() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Generates a section id that does not collide with any of `taken`.
pub fn generate_section_id<'a, I>(taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: std::collections::HashSet<&str> = taken.into_iter().collect();
    loop {
        let candidate = random_base36();
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}
