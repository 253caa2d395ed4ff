//! Hostnames that discovered article links are allowed to point at.
//!
//! The list is independent of the catalog that supplied a source's homepage:
//! a link found on an allowed page is still dropped when it leaves the list.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Domains of the outlets the bundled catalog covers.
const DEFAULT_DOMAINS: &[&str] = &[
    // USA
    "techcrunch.com", "theverge.com", "arstechnica.com", "wired.com", "engadget.com",
    "scientificamerican.com", "sciencedaily.com", "livescience.com", "space.com",
    "espn.com", "bleacherreport.com", "si.com", "theathletic.com", "cbssports.com",
    "variety.com", "hollywoodreporter.com", "deadline.com", "ew.com", "rollingstone.com",
    "webmd.com", "healthline.com", "statnews.com", "health.com",
    "insideclimatenews.org", "grist.org", "e360.yale.edu", "climatecentral.org",
    "politico.com", "thehill.com", "axios.com", "cnn.com", "foxnews.com",
    "coindesk.com", "theblock.co", "decrypt.co", "bitcoinmagazine.com",
    "ign.com", "gamespot.com", "kotaku.com", "polygon.com", "pcgamer.com",
    // UK
    "theregister.com", "techradar.com", "wired.co.uk", "bbc.com", "bbc.co.uk",
    "newscientist.com", "nature.com", "theguardian.com",
    "skysports.com", "talksport.com",
    "digitalspy.com", "nme.com", "radiotimes.com",
    "nhs.uk",
    "carbonbrief.org", "climatechangenews.com",
    "news.sky.com", "politico.eu",
    "cityam.com",
    "eurogamer.net", "rockpapershotgun.com", "gamesradar.com", "nintendolife.com",
    // Canada
    "betakit.com", "itworldcanada.com", "mobilesyrup.com", "dailyhive.com",
    "cbc.ca", "canadiangeographic.ca", "science.gc.ca",
    "tsn.ca", "sportsnet.ca",
    "etcanada.com", "thestar.com",
    "healthing.ca", "globalnews.ca",
    "nationalobserver.com", "thenarwhal.ca",
    "theglobeandmail.com", "ipolitics.ca",
    "cgmagonline.com",
    // Germany
    "heise.de", "golem.de", "t3n.de", "chip.de",
    "spektrum.de", "scinexx.de", "wissenschaft.de",
    "kicker.de", "sport1.de", "sportschau.de", "spox.com",
    "dwdl.de", "filmstarts.de", "rollingstone.de",
    "apotheken-umschau.de", "netdoktor.de", "gesundheit.de",
    "klimareporter.de", "utopia.de", "spiegel.de",
    "tagesschau.de", "zeit.de", "faz.net",
    "btc-echo.de", "de.cointelegraph.com", "blocktrainer.de",
    "gamestar.de", "pcgames.de", "4players.de", "spieletipps.de",
    // France
    "01net.com", "numerama.com", "frandroid.com", "lesnumeriques.com",
    "sciencesetavenir.fr", "futura-sciences.com", "pourlascience.fr",
    "lequipe.fr", "rmcsport.bfmtv.com", "eurosport.fr", "sofoot.com",
    "allocine.fr", "premiere.fr", "telerama.fr",
    "doctissimo.fr", "santemagazine.fr", "topsante.com",
    "novethic.fr", "vert.eco", "actu-environnement.com",
    "francetvinfo.fr", "lemonde.fr", "lefigaro.fr",
    "journalducoin.com", "cryptonaute.fr", "cointribune.com",
    "jeuxvideo.com", "gamekult.com", "jeuxactu.com", "nofrag.com",
    // Italy
    "tomshw.it", "hdblog.it", "punto-informatico.it", "wired.it",
    "lescienze.it", "focus.it", "galileonet.it",
    "gazzetta.it", "corrieredellosport.it", "tuttosport.com", "sport.sky.it",
    "comingsoon.it", "badtaste.it", "rockol.it",
    "corriere.it", "humanitasalute.it", "ok-salute.it",
    "rinnovabili.it", "qualenergia.it", "greenreport.it",
    "ansa.it", "repubblica.it", "ilpost.it",
    "cryptonomist.ch", "criptovaluta.it", "it.cointelegraph.com",
    "multiplayer.it", "everyeye.it", "spaziogames.it", "it.ign.com",
    // Spain
    "xataka.com", "genbeta.com", "elandroidelibre.elespanol.com", "hipertextual.com",
    "muyinteresante.es", "nationalgeographic.com.es", "agenciasinc.es",
    "marca.com", "as.com", "mundodeportivo.com", "sport.es",
    "sensacine.com", "ecartelera.com", "formulatv.com",
    "cuidateplus.marca.com", "webconsultas.com", "infosalus.com",
    "climatica.lamarea.com", "ecologistasenaccion.org", "elperiodicodelaenergia.com",
    "elpais.com", "elmundo.es", "lavanguardia.com",
    "es.cointelegraph.com", "news.bit2me.com", "observatorioblockchain.com",
    "3djuegos.com", "vandal.elespanol.com", "meristation.as.com", "vidaextra.com",
    // Romania
    "playtech.ro", "go4it.ro", "start-up.ro", "techcafe.ro",
    "descopera.ro", "sciencealert.ro", "natgeo.ro",
    "gsp.ro", "prosport.ro", "sport.ro", "digisport.ro",
    "cinemagia.ro", "adevarul.ro", "observator.tv",
    "romedic.ro", "sfatulmedicului.ro", "viata-medicala.ro",
    "greenpeace.org", "digi24.ro",
    "hotnews.ro", "g4media.ro",
    "crypto.ro",
    "go4games.ro", "need4games.ro",
    // Poland
    "antyweb.pl", "chip.pl", "komputerswiat.pl", "benchmark.pl",
    "naukawpolsce.pl", "crazynauka.pl", "national-geographic.pl",
    "sport.pl", "sportowefakty.wp.pl", "przegladsportowy.pl", "sport.interia.pl",
    "filmweb.pl", "kultura.onet.pl", "film.wp.pl",
    "medonet.pl", "poradnikzdrowie.pl", "zdrowie.pap.pl",
    "zielona.interia.pl", "hightech.fm", "wyborcza.pl",
    "tvn24.pl", "wiadomosci.onet.pl", "rp.pl",
    "bitcoin.pl", "kryptowaluty.pl", "cryptonews.pl",
    "gry-online.pl", "cdaction.pl", "ppe.pl", "gram.pl",
    // Shared
    "cointelegraph.com",
];

static DEFAULT_ALLOW_LIST: Lazy<DomainAllowList> =
    Lazy::new(|| DomainAllowList::new(DEFAULT_DOMAINS.iter().copied()));

/// A case-insensitive set of permitted hostnames.
///
/// Hosts are compared after lower-casing and stripping one leading `www.`,
/// so `www.Grist.org` and `grist.org` are the same entry.
#[derive(Debug, Clone, Default)]
pub struct DomainAllowList {
    domains: HashSet<String>,
}

impl DomainAllowList {
    /// Build a list from hostnames.
    ///
    /// # Arguments
    ///
    /// * `domains` - Hostnames in any case, with or without one `www.` prefix
    ///
    /// # Returns
    ///
    /// A list holding every non-empty normalized entry.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let list = DomainAllowList::new(["www.Grist.org"]);
    /// assert!(list.contains("grist.org"));
    /// ```
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| normalize_host(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    /// The bundled list covering every outlet in the default catalog.
    pub fn builtin() -> &'static DomainAllowList {
        &DEFAULT_ALLOW_LIST
    }

    /// The bundled list plus `extra` domains from configuration.
    pub fn builtin_with<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::builtin().clone();
        list.extend(extra);
        list
    }

    /// Add more hostnames, normalized the same way as [`DomainAllowList::new`].
    /// Empty entries are skipped.
    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.domains.extend(
            extra
                .into_iter()
                .map(|d| normalize_host(d.as_ref()))
                .filter(|d| !d.is_empty()),
        );
    }

    /// Whether `host` is permitted.
    ///
    /// Only one leading `www.` is ignored, so `www.www.example.com` does not
    /// match an `example.com` entry. Subdomains are never implied.
    pub fn contains(&self, host: &str) -> bool {
        self.domains.contains(&normalize_host(host))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Lower-case a host and strip a single leading `www.`.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
