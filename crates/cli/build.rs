use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("qa2tex")
        .version(env!("CARGO_PKG_VERSION"))
        .author("qa2tex Contributors")
        .about("Turn StackExchange questions into LaTeX")
        .arg(clap::arg!(<INPUT> "Question URL, question ID, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, markup)")
                .value_name("FORMAT")
                .default_value("json")
                .value_parser(["json", "markup"]),
        )
        .arg(
            clap::arg!(--site <URL> "Site that question IDs and relative links resolve against")
                .default_value("https://tex.stackexchange.com"),
        )
        .arg(
            clap::arg!(--images_dir <DIR> "Directory for downloaded images (markup only)")
                .value_name("DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--no_images "Never download images; figures reference the placeholder image"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--retries <NUM> "Retries for timeouts, connection failures and server errors").default_value("2"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(
            clap::arg!(--order <ORDER> "Answer order")
                .default_value("accepted")
                .value_parser(["accepted", "votes", "document"]),
        )
        .arg(clap::arg!(--partial "Keep going when a field is missing, reporting it instead"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "qa2tex", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "qa2tex", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "qa2tex", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "qa2tex", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
