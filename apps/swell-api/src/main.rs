use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = swell_api::Args::parse();
	swell_api::run(args).await
}
