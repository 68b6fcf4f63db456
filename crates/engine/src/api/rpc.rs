//! RPC dispatch: one flat request enum in, one response out.
//!
//! Every domain rejection leaves here as `Response::Fault`; transport
//! trouble on the caller's side is simply a failed HTTP exchange and
//! never appears in a response body.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use mudlink_domain::MudFault;
use mudlink_shared::{Request, Response};

use crate::app::App;
use crate::world::person::PersonHandle;
use crate::world::place::PlaceRef;
use crate::world::server::DumpError;

pub async fn rpc_handler(State(app): State<Arc<App>>, Json(request): Json<Request>) -> Json<Response> {
    Json(dispatch(&app, request).await)
}

/// Execute one protocol operation against this server's world.
pub async fn dispatch(app: &App, request: Request) -> Response {
    match dispatch_inner(app, request).await {
        Ok(response) => response,
        Err(fault) => Response::fault(fault),
    }
}

async fn dispatch_inner(app: &App, request: Request) -> Result<Response, MudFault> {
    let server = &app.server;
    Ok(match request {
        // Server operations
        Request::GetMudName => Response::MudName {
            name: server.mud_name().to_string(),
        },
        Request::GetEntrance => {
            let place = server.get_entrance()?;
            Response::Place {
                address: server.addr().clone(),
                name: place.name().to_string(),
            }
        }
        Request::GetNamedPlace { name } => {
            let place = server.get_named_place(&name)?;
            Response::Place {
                address: server.addr().clone(),
                name: place.name().to_string(),
            }
        }
        Request::Dump { password, target } => match server.dump(&password, &target).await {
            Ok(()) => Response::Done,
            Err(DumpError::Fault(fault)) => return Err(fault),
            Err(e) => {
                tracing::warn!(error = %e, "dump failed");
                Response::Error {
                    message: e.to_string(),
                }
            }
        },

        // Place operations
        Request::GetPlaceName { place } => {
            let place = server.get_named_place(&place)?;
            Response::Text {
                value: place.name().to_string(),
            }
        }
        Request::GetDescription { place } => {
            let place = server.get_named_place(&place)?;
            Response::Text {
                value: place.description().to_string(),
            }
        }
        Request::GetNames { place } => {
            let place = server.get_named_place(&place)?;
            Response::Names {
                names: place.names().await,
            }
        }
        Request::GetThings { place } => {
            let place = server.get_named_place(&place)?;
            Response::Names {
                names: place.thing_names().await,
            }
        }
        Request::GetExits { place } => {
            let place = server.get_named_place(&place)?;
            Response::Names {
                names: place.exit_names().await,
            }
        }
        Request::GetPerson { place, name } => {
            let place = server.get_named_place(&place)?;
            let person = place.get_person(&name).await?;
            Response::Person {
                who: person.addr().clone(),
            }
        }
        Request::ExamineThing { place, name } => {
            let place = server.get_named_place(&place)?;
            Response::Text {
                value: place.examine_thing(&name).await?,
            }
        }
        Request::GetServer { place } => {
            // Confirms the place is really here before naming its owner.
            server.get_named_place(&place)?;
            Response::Server {
                address: server.addr().clone(),
                world: server.mud_name().to_string(),
            }
        }
        Request::Go { place, who, exit } => {
            let place = server.get_named_place(&place)?;
            let actor = app.resolve_actor(&who);
            match place.go(server, actor, &exit).await? {
                PlaceRef::Local(destination) => Response::Place {
                    address: server.addr().clone(),
                    name: destination.name().to_string(),
                },
                PlaceRef::Remote(destination) => Response::Place {
                    address: destination.address().clone(),
                    name: destination.name().to_string(),
                },
            }
        }
        Request::Speak { place, who, message } => {
            let place = server.get_named_place(&place)?;
            place.speak(&who, &message).await?;
            Response::Done
        }
        Request::Act { place, who, message } => {
            let place = server.get_named_place(&place)?;
            place.act(&who, &message).await?;
            Response::Done
        }
        Request::CreateThing {
            place,
            who,
            name,
            description,
        } => {
            let place = server.get_named_place(&place)?;
            place.create_thing(&who, &name, &description).await?;
            Response::Done
        }
        Request::DestroyThing { place, who, name } => {
            let place = server.get_named_place(&place)?;
            place.destroy_thing(&who, &name).await?;
            Response::Done
        }
        Request::CreatePlace {
            place,
            who,
            exit,
            entrance,
            name,
            description,
        } => {
            let place = server.get_named_place(&place)?;
            place
                .create_place(server, &who, &exit, &entrance, &name, &description)
                .await?;
            Response::Done
        }
        Request::LinkTo {
            place,
            who,
            exit,
            host,
            world,
            name,
        } => {
            let place = server.get_named_place(&place)?;
            place
                .link_to(server, &who, &exit, &host, &world, &name)
                .await?;
            Response::Done
        }
        Request::Close { place, who, exit } => {
            let place = server.get_named_place(&place)?;
            place.close(&who, &exit).await?;
            Response::Done
        }
        Request::Enter {
            place,
            who,
            name,
            message,
        } => {
            let place = server.get_named_place(&place)?;
            let actor = app.resolve_actor(&who);
            place.enter(actor, &name, message.as_deref()).await?;
            Response::Done
        }
        Request::Exit { place, who, message } => {
            let place = server.get_named_place(&place)?;
            place.leave(&who, message.as_deref()).await;
            Response::Done
        }

        // Person operations
        Request::Tell { person, message } => {
            let person = app.directory.get(&person).ok_or(MudFault::NoSuchPerson)?;
            person
                .tell(&message)
                .await
                .map_err(|_| MudFault::NoSuchPerson)?;
            Response::Done
        }
        Request::GetPersonDescription { person } => {
            let person = app.directory.get(&person).ok_or(MudFault::NoSuchPerson)?;
            let value = person
                .description()
                .await
                .map_err(|_| MudFault::NoSuchPerson)?;
            Response::Text { value }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::directory::PersonDirectory;
    use crate::test_fixtures::test_server;
    use mudlink_domain::PersonId;
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let server = test_server("Alpha");
        let directory = Arc::new(PersonDirectory::new(server.addr().clone()));
        App::new(server, directory)
    }

    #[tokio::test]
    async fn domain_rejections_travel_as_faults() {
        let app = test_app();
        let response = dispatch(
            &app,
            Request::GetDescription {
                place: "Basement".into(),
            },
        )
        .await;
        assert!(response.is_fault(MudFault::NoSuchPlace));

        let response = dispatch(
            &app,
            Request::Tell {
                person: PersonId::new(),
                message: "anyone?".into(),
            },
        )
        .await;
        assert!(response.is_fault(MudFault::NoSuchPerson));
    }

    #[tokio::test]
    async fn dump_with_a_bad_password_is_a_fault_not_an_error() {
        let app = test_app();
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("world.json");
        let response = dispatch(
            &app,
            Request::Dump {
                password: "letmein".into(),
                target: target.to_string_lossy().into_owned(),
            },
        )
        .await;
        assert!(response.is_fault(MudFault::BadPassword));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn server_operations_answer_about_this_world() {
        let app = test_app();

        let response = dispatch(&app, Request::GetMudName).await;
        assert!(matches!(response, Response::MudName { name } if name == "Alpha"));

        let response = dispatch(&app, Request::GetEntrance).await;
        assert!(matches!(response, Response::Place { name, .. } if name == "Lobby"));

        let response = dispatch(
            &app,
            Request::GetServer {
                place: "Lobby".into(),
            },
        )
        .await;
        assert!(matches!(response, Response::Server { world, .. } if world == "Alpha"));
    }

    #[tokio::test]
    async fn attached_occupants_answer_tell_and_description() {
        let app = test_app();
        let (tx, mut rx) = mpsc::channel(4);
        let person = app.directory.attach("Otto", "a tall tester", tx);
        let id = person.addr().id;

        let response = dispatch(
            &app,
            Request::Tell {
                person: id,
                message: "psst".into(),
            },
        )
        .await;
        assert!(matches!(response, Response::Done));
        assert_eq!(rx.recv().await.as_deref(), Some("psst"));

        let response = dispatch(&app, Request::GetPersonDescription { person: id }).await;
        assert!(matches!(response, Response::Text { value } if value == "a tall tester"));

        // Detaching turns the handle stale.
        app.directory.detach(&id);
        let response = dispatch(
            &app,
            Request::Tell {
                person: id,
                message: "gone".into(),
            },
        )
        .await;
        assert!(response.is_fault(MudFault::NoSuchPerson));
    }
}
