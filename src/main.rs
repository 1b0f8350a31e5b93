fn main() -> anyhow::Result<()> {
    github_repo_explorer::cli::run()
}
