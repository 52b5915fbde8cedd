use vergen::{BuildBuilder, Emitter, RustcBuilder};
use vergen_git2::Git2Builder;

// Emits the VERGEN_* variables read by `coders --version`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;
    let rustc = RustcBuilder::default().semver(true).build()?;

    let git2_result = Git2Builder::default()
        .describe(true, true, None)
        .sha(true)
        .build();

    // Source tarballs have no repository to describe.
    if let Ok(git2) = git2_result {
        Emitter::default()
            .add_instructions(&build)?
            .add_instructions(&rustc)?
            .add_instructions(&git2)?
            .emit()?;
    } else {
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
        println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");

        Emitter::default()
            .add_instructions(&build)?
            .add_instructions(&rustc)?
            .emit()?;
    }

    Ok(())
}
