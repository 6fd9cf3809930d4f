mod clif;
mod decode;
mod emission;
mod settings;
mod translate;

use a32_translate::interpreter::{run, RegisterFile};
use a32_translate::ir::{Function, FunctionBuilder};
use a32_translate::{TranslateResult, Translator};

/// Translate `words` into reference IR and run it over `regs`.
pub(crate) fn translate_and_run(
    words: &[u32],
    regs: &mut RegisterFile,
) -> TranslateResult<Function> {
    let _ = env_logger::try_init();

    let mut func = Function::with_name("block");
    Translator::default().translate_block(&mut FunctionBuilder::new(&mut func), 0x1000, words)?;
    run(&func, regs).unwrap_or_else(|e| panic!("{e}\n{func}"));
    Ok(func)
}
