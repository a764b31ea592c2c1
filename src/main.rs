use drug_eda::error::LoadError;

fn main() {
    if let Err(err) = drug_eda::run() {
        match err.downcast_ref::<LoadError>() {
            Some(load) => eprintln!("error: {load}"),
            None => eprintln!("error: An error occurred: {err:#}"),
        }
        std::process::exit(1);
    }
}
