use std::error::Error;

use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn Error>> {
	let cargo = CargoBuilder::default().target_triple(true).build()?;
	let gitcl = GitclBuilder::default().sha(true).build()?;
	let mut emitter = Emitter::default();

	emitter.add_instructions(&cargo)?;

	// Source tarballs carry no git metadata.
	if emitter.add_instructions(&gitcl).is_err() {
		println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
	}

	emitter.emit()?;

	Ok(())
}
