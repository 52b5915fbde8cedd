fn main() -> Result<(), Box<dyn std::error::Error>> {
    coders::cli::main()
}
