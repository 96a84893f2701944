use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Table { action } => commands::table::handle(&action, ctx, flags),
        Commands::Register(args) => commands::register::handle(args, ctx, flags),
        Commands::RegisterMany(args) => commands::register::handle_many(&args, ctx, flags),
        Commands::Get(args) => commands::attachment::get(&args, ctx, flags),
        Commands::List(args) => commands::attachment::list(&args, ctx, flags),
        Commands::Remove(args) => commands::attachment::remove(&args, ctx, flags),
        Commands::RemoveAll(args) => commands::attachment::remove_all(&args, ctx, flags),
        Commands::Validate(args) => commands::validate::validate(&args, ctx, flags),
        Commands::ValidateAll(args) => commands::validate::validate_all(&args, ctx, flags),
    }
}
