use serde::Serialize;

#[expect(clippy::print_stdout, reason = "command results are the program's output")]
pub(crate) fn print_json<T>(value: &T) -> Result<(), String>
where
    T: Serialize + ?Sized,
{
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to render output: {error}"))?;

    println!("{rendered}");

    Ok(())
}
