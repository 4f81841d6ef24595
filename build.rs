fn main() {
    uniffi::generate_scaffolding("src/submerge.udl").unwrap();
}
