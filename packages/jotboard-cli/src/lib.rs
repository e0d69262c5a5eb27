//! Shared command-line presentation for the Jotboard binaries.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

/// Package version tagged with the git revision and target triple.
pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_starts_with_the_package_version() {
		assert!(VERSION.starts_with(concat!(env!("CARGO_PKG_VERSION"), "-")));
		assert!(VERSION.matches('-').count() >= 2);
	}
}
