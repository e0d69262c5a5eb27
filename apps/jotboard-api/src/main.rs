use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = jotboard_api::Args::parse();
	jotboard_api::run(args).await
}
