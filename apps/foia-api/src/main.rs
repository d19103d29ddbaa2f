use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = foia_api::Args::parse();

	foia_api::run(args).await
}
