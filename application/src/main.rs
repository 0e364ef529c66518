use std::{
    future::IntoFuture as _,
    io,
    sync::{Arc, OnceLock},
};

use application::{
    args::{Command, Credentials, Profile},
    config,
    consent::Terminal,
    error::{AuthError, NotFoundError},
    render,
    route::{guard, Decision},
    view::{
        auth::{self, Login, Register},
        Banner, Connections, CreateProfile, Details, Listing, Status,
        TopPartners,
    },
    Args, Config, Error, Route, Service,
};
use secrecy::SecretString;
use service::{
    domain::partner::{self, patch, ExperienceLevel},
    infra::{
        api::{self, http::Url},
        identity::Firebase,
    },
    read::partner::list::SortKey,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    if start().await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        api: api_config,
        identity: identity_config,
        listing,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let base = Url::parse(&api_config.base_url).map_err(|e| {
        log::error!("`{}` is not a valid API URL: {e}", api_config.base_url);
    })?;
    let api = api::Http::new(base, api_config.timeout).map_err(|e| {
        log::error!("failed to initialize `Http` API client: {e}");
    })?;

    let endpoint = Url::parse(&identity_config.endpoint).map_err(|e| {
        log::error!(
            "`{}` is not a valid identity URL: {e}",
            identity_config.endpoint,
        );
    })?;
    let identity = Firebase::new(
        endpoint,
        identity_config.api_key,
        identity_config.timeout,
        Some(Arc::new(Terminal)),
    )
    .map_err(|e| {
        log::error!("failed to initialize `Firebase` provider: {e}");
    })?;

    let (service, background) = Service::new(identity, api);

    let task = run(&service, command, listing);
    tokio::pin!(task);
    let finished = tokio::select! {
        res = &mut task => Some(res),
        res = background.into_future() => {
            if let Err(e) = res {
                log::error!("background task failed: {e}");
                return Err(());
            }
            None
        }
    };
    let outcome = match finished {
        Some(res) => res,
        None => task.await,
    };
    outcome.map_err(|e| {
        println!("{}", render::error(&e));
        log::debug!("{e}");
    })
}

/// Runs the provided [`Command`] against the provided [`Service`].
async fn run(
    svc: &Service,
    command: Command,
    listing: config::Listing,
) -> Result<(), Error> {
    match command {
        Command::Partners { search, sort, page } => {
            let mut view = Listing::new(listing.page_size());
            match (search, sort) {
                (Some(term), _) => {
                    _ = view.apply_search(svc, &term).await;
                }
                (None, Some(key)) => {
                    let level = key.parse::<ExperienceLevel>().map_err(|_| {
                        Error::internal(&format!("unknown experience `{key}`"))
                    })?;
                    _ = view.apply_sort(svc, SortKey(level)).await;
                }
                (None, None) => {
                    _ = view.load_all(svc).await;
                }
            }
            _ = view.set_page(page);
            println!("{}", render::listing(&view));
        }
        Command::Recent => {
            let mut view = Banner::default();
            _ = view.load(svc).await;
            println!("{}", render::banner(&view));
        }
        Command::Top => {
            let mut view = TopPartners::default();
            _ = view.load(svc).await;
            println!("{}", render::top(&view));
        }
        Command::Partner { id, auth } => {
            if let Ok(id) = id.parse() {
                authorize(svc, auth, Route::Partner(id)).await?;
            }
            let mut view = Details::default();
            _ = view.load(svc, &id).await;
            println!("{}", render::details(&view));
        }
        Command::Register {
            name,
            auth: Credentials { email, password },
            photo_url,
        } => {
            let session = Register {
                name,
                email,
                password: SecretString::from(password),
                photo_url,
            }
            .submit(svc)
            .await?;
            println!("Welcome, {}!", session.greeting_name());
        }
        Command::LoginGoogle => {
            let to = auth::google(svc, None).await?;
            if let Some(s) = svc.session().current() {
                println!("Signed in as {}, continue at {to}", s.greeting_name());
            }
        }
        Command::Connections { auth } => {
            let view = connections(svc, auth).await?;
            println!("{}", render::connections(&view));
        }
        Command::Update {
            id,
            name,
            subject,
            study_mode,
            image_url,
            auth,
        } => {
            let id = partner_id(&id)?;
            let mut view = connections(svc, auth).await?;
            let form = patch::Form {
                name,
                subject,
                study_mode,
                image_url,
            };
            view.update(svc, &id, &form).await?;
            println!("{}", render::connections(&view));
        }
        Command::Delete { id, auth } => {
            let id = partner_id(&id)?;
            let mut view = connections(svc, auth).await?;
            view.delete(svc, &id).await?;
            println!("{}", render::connections(&view));
        }
        Command::Create { profile, auth } => {
            authorize(svc, auth, Route::CreateProfile).await?;
            let mut view = CreateProfile::new(svc.session().current().as_ref());
            fill(&mut view, profile);
            let id = view.submit(svc).await?;
            println!("Profile created, see {}", Route::Partner(id));
        }
    }
    Ok(())
}

/// Signs in with the provided [`Credentials`] and guards the provided
/// [`Route`].
async fn authorize(
    svc: &Service,
    Credentials { email, password }: Credentials,
    route: Route,
) -> Result<(), Error> {
    let login = Login {
        email,
        password: SecretString::from(password),
    };
    let to = login.submit(svc, Some(route)).await?;

    match guard(&svc.session().settled().await, &to) {
        Decision::Allow => Ok(()),
        Decision::Pending | Decision::Redirect { .. } => {
            Err(AuthError::AuthorizationRequired.into())
        }
    }
}

/// Signs in and loads the [`Connections`] of the signed-in account.
async fn connections(
    svc: &Service,
    auth: Credentials,
) -> Result<Connections, Error> {
    authorize(svc, auth, Route::Connections).await?;

    let mut view = Connections::default();
    let owner = svc.session().current().and_then(|s| s.email);
    _ = view.load(svc, owner).await;
    if let Status::Failed(e) = view.status() {
        return Err(e.clone());
    }
    Ok(view)
}

/// Parses the provided raw [`partner::Id`].
fn partner_id(raw: &str) -> Result<partner::Id, Error> {
    raw.parse().map_err(|_| NotFoundError::PartnerNotFound.into())
}

/// Fills the [`CreateProfile`] form with the provided [`Profile`] fields,
/// keeping the prefilled ones not provided.
fn fill(view: &mut CreateProfile, profile: Profile) {
    let Profile {
        name,
        photo_url,
        bio,
        subject,
        study_mode,
        availability,
        location,
        experience,
        rating,
    } = profile;
    let form = &mut view.form;
    for (field, value) in [
        (&mut form.name, name),
        (&mut form.photo_url, photo_url),
        (&mut form.bio, bio),
        (&mut form.subject, subject),
        (&mut form.study_mode, study_mode),
        (&mut form.availability, availability),
        (&mut form.location, location),
        (&mut form.experience, experience),
        (&mut form.rating, rating),
    ] {
        if !value.is_empty() {
            *field = value;
        }
    }
}
