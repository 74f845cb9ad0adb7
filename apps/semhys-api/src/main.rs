use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = semhys_api::Args::parse();

	semhys_api::run(args).await
}
