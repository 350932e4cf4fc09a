use barcode128::{bars_to_blocks, Code128};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let code = Code128::encode_ucc("(01)00000090311314(10)ABC123")?;
    let string = bars_to_blocks(code.bars());
    println!("{}", &string);
    println!("{}", &string);
    println!("{}", code.human_readable());
    Ok(())
}
