use shadow_rs::ShadowBuilder;

fn main() {
    // Version and git metadata for `omnicache --version` and the health endpoint
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
