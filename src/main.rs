fn main() -> Result<(), Box<dyn std::error::Error>> {
    doki::cli::main()
}
