use rand::{thread_rng, Rng};

/// Random numeric component of an uploaded object name, in `0..90000`.
pub fn object_suffix() -> u32 {
    thread_rng().gen_range(0..90_000)
}

/// `<prefix>-<random>-<owner>`, the naming scheme for stored resumes and logos.
pub fn object_name(prefix: &str, owner: &str) -> String {
    format!("{}-{}-{}", prefix, object_suffix(), owner)
}
