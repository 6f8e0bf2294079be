use cinedrop_core::MovieId;

use crate::cli::{MovieArgs, OutputFormat, SearchArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_candidates, render_movie_detail, render_movies};

pub(crate) async fn handle_search(
    ctx: &AppContext,
    args: SearchArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::validation("query must not be empty"));
    }
    let movies = ctx.pipeline.search_movies(query).await?;
    render_movies(&movies, &ctx.image_base_url, output)
}

pub(crate) async fn handle_detail(
    ctx: &AppContext,
    args: MovieArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let movie = ctx.pipeline.movie_detail(MovieId(args.id)).await?;
    render_movie_detail(&movie, &ctx.image_base_url, output)
}

pub(crate) async fn handle_candidates(
    ctx: &AppContext,
    args: MovieArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let movie = ctx.pipeline.movie_detail(MovieId(args.id)).await?;
    let listing = ctx.pipeline.list_candidates(&movie).await?;
    render_candidates(&movie, &listing, output)
}
