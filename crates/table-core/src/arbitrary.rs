/// Generate a randomized-but-valid instance of `Self`, used by unit tests to exercise
/// invariants over many scenarios without pulling in a property-testing crate.
pub trait Arbitrary {
    fn random() -> Self;
}

impl Arbitrary for bool {
    fn random() -> Self {
        rand::random()
    }
}

impl Arbitrary for u8 {
    fn random() -> Self {
        rand::random()
    }
}
